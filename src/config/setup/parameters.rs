pub mod forcing;
pub mod simulation;

// The right end is always clamped to zero. The left end is either clamped
// too, or left to the zero-padded update rule alone.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeftBoundary {
    #[default]
    Fixed,
    Free,
}
