mod committee;

pub use committee::{Committee, CommitteeTag};
