// Web-Modul: Fernsteuer-Seite und WebSocket-Protokoll

pub mod protocol;

// Steuerseite wird zur Compile-Zeit ins Binary eingebettet
pub const INDEX_HTML: &str = include_str!("index.html");
