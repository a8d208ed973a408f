/// Nodes of the pipeline graph.
///
/// The graph is fixed: start → Search → Explain → end. There are no
/// conditional edges and no loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Retrieve context for the question.
    Search,
    /// Generate the answer from question and context.
    Explain,
}

impl Stage {
    /// The stage the start marker leads to.
    pub fn first() -> Stage {
        Stage::Search
    }

    /// Returns the next stage, or None when the end marker follows.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Search => Some(Stage::Explain),
            Stage::Explain => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Search => "search",
            Stage::Explain => "explain",
        }
    }
}
