mod setting;

pub use setting::Setting;
