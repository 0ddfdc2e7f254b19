pub mod error;
pub mod extract;
pub mod package;
pub mod parser;
pub mod writer;
mod xml_names;

pub use error::Error;
pub use extract::extract;
pub use package::Package;
pub use parser::DocumentXml;
