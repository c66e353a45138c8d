#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A caller asked for more sail than the ship carries. This is a logic
    /// bug in the caller and the level is left unchanged.
    #[error("cannot set sail level {requested}, maximum is {max}")]
    SailLevelOutOfRange { requested: u8, max: u8 },
    #[error("unknown scenario {0:?}")]
    UnknownScenario(String),
    #[error("invalid config: {0}")]
    Config(String),
}
