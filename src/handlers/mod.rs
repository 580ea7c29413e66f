pub mod health;
pub mod html;
pub mod images;
