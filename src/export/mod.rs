/*!
# Incidence exports

Reports over an augmented OCEAN ontology, written as CSV files:

- smells of one kind per committer (`refactoringsbycommitter_<uid>.csv`);
- monthly incidence of recommended refactorings (`incidence_<uid>.csv`);
- the same incidence, limited to effort-contextualized recommendations.

A [`ProcessingAdapter`] names its [`IncidenceQuery`], receives the rows one by
one and writes its file in `conclude`. [`QueryConnector`] drives it.
*/

pub mod adapters;
pub mod query;

pub use adapters::{
    CsvReport, EffortContextualizedIncidenceExporter, IncidenceOfRefactoringsExporter,
    ProcessingAdapter, QueryConnector, RefactoringsByCommittersExporter,
};
pub use query::{Binding, IncidenceQuery, QueryRow};
