pub mod buffer;
pub mod config;
pub mod contingency;
pub mod error;
pub mod evidence;
pub mod genome;
pub mod mutation;
pub mod nars;
pub mod selection;
pub mod sensorimotor;
pub mod sentence;
pub mod temporal;
pub mod term;

pub use buffer::{Buffer, Memorable, MergePolicy};
pub use config::{Config, EvolutionConfig, NarsConfig, SelectionConfig};
pub use contingency::Contingency;
pub use error::{NarsError, ParseError, Result};
pub use evidence::EvidentialValue;
pub use genome::{
    EvolutionMode, EvolvableSentence, GenePool, Genome, Personality, PersonalityParameters,
};
pub use nars::Nars;
pub use selection::{Sampling, SelectionTable, SharedSelectionTable};
pub use sensorimotor::{Direction, SensorimotorVocabulary, TileKind, Verb};
pub use sentence::{Punctuation, Sentence, Stamp, StampSource, parse_sentence};
pub use temporal::{Anticipation, InductionContext, TemporalModule};
pub use term::{Connector, Copula, Term, TermArena, TermKind, VariableKind};
