pub mod file;
pub mod openweathermap;

pub use file::WeatherFile;
pub use openweathermap::OpenWeatherMapClient;
