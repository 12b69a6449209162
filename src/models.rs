#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub url: String, // kept exactly as typed, this is the primary key
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Saved,
    Cancelled,
}
