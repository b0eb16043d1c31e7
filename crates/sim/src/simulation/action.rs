/// Control actions an observer can return during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the tick just committed and return the solution so far.
    StopEarly,
}
