mod formatter;
mod level;
mod types;

pub use formatter::{Color, SHORT_FIELD_MAX_CHARS, format_event, is_short, map_color, render_value};
pub use level::{Level, level_threshold};
pub use types::{Attachment, AttachmentField, LogEvent};
