pub mod header;
pub mod language_picker;
pub mod progress_bar;
pub mod result_card;
pub mod upload_area;
