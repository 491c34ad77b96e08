mod player;
mod question;

pub use player::{PlayerId, PlayerLink};
pub use question::{Question, QuestionTemplate};
