/// Ending — a terminal narrative node with no choices.
///
/// Ending ids need not be disjoint from chapter ids; when an id appears in
/// both tables, ending membership is checked first by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Ending {
    pub id: String,
    pub lines: Vec<String>,
}
