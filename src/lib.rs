mod boxes;
mod canvas;
mod dimensions;
mod error;
mod geometry;
mod infobits;
mod pdf;
mod types;

pub use boxes::{AnswerBox, AnswerBoxes};
pub use canvas::{Canvas, Command, Document, TextAlign};
pub use dimensions::{TableDims, merge_dimensions, parse_dimensions};
pub use error::SheetError;
pub use geometry::{CellSize, DEFAULT_CELL_RATIO, Geometry, GeometryAnalyzer};
pub use infobits::{INFOBITS_TABLE, Model, decode, encode};
pub use pdf::document_to_pdf;
pub use types::{Color, Point, Px, Size};
