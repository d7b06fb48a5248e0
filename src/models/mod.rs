pub mod alert;
pub mod analysis;
pub mod discussion;
pub mod notification;
pub mod settings;
pub mod stock;
