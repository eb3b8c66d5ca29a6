use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route template is empty")]
    EmptyTemplate,
    #[error("route template '{template}' does not start with '/'")]
    MissingLeadingSlash { template: String },
    #[error("segment '{segment}' has an unclosed variable marker")]
    UnclosedVariable { segment: String },
    #[error("variable in segment '{segment}' has no name")]
    VariableMissingName { segment: String },
    #[error(
        "variable name '{name}' in segment '{segment}' must start with an alphabetic character or underscore (found '{found}')"
    )]
    VariableInvalidStart {
        segment: String,
        name: String,
        found: char,
    },
    #[error("variable name '{name}' in segment '{segment}' contains invalid character '{invalid}'")]
    VariableInvalidCharacter {
        segment: String,
        name: String,
        invalid: char,
    },
    #[error("variable '{name}' is declared more than once in template '{template}'")]
    DuplicateVariable { template: String, name: String },
    #[error("constraint for variable '{name}' in segment '{segment}' is not a valid regex")]
    InvalidConstraint {
        segment: String,
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("wildcard segment must be terminal: index {segment_index} of {total_segments} in template '{template}'")]
    WildcardMustBeTerminal {
        template: String,
        segment_index: usize,
        total_segments: usize,
    },
    #[error("'*' must form a whole segment in template '{template}' (segment '{segment}')")]
    WildcardNotAlone { template: String, segment: String },
    #[error("cannot build path: variable '{name}' was not supplied")]
    MissingVariable { name: String },
    #[error("cannot build path: value '{value}' violates the constraint of variable '{name}'")]
    ConstraintViolation { name: String, value: String },
}

pub type RouteResult<T> = Result<T, RouteError>;
