pub mod loaders;
pub mod question;
pub mod reference;
pub mod subject;

pub use loaders::{load_reference_bank, select_reference_questions};
pub use question::{
    GeneratedQuestion, GeneratedSet, McqOptions, McqQuestion, OpenEndedQuestion, OptionLetter,
    QuestionType,
};
pub use reference::ReferenceBank;
pub use subject::Subject;
