use thiserror::Error;

/// Coarse classification of a [`SlotError`].
///
/// Callers decide on retries and presentation from the kind alone; the
/// variant carries the precise reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    Conflict,
    NotFound,
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Authorization => "authorization",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid slots: {0}")]
    InvalidSlots(String),

    #[error("No valid slots to create: {0}")]
    NoValidSlots(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Not the owner: {0}")]
    NotOwner(String),

    #[error("Doctor not found: {0}")]
    DoctorNotFound(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Slot is booked: {0}")]
    SlotBooked(String),

    #[error("Slot already booked: {0}")]
    AlreadyBooked(String),

    #[error("Slot is not booked: {0}")]
    NotBooked(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

impl SlotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlotError::InvalidDate(_)
            | SlotError::InvalidSlots(_)
            | SlotError::NoValidSlots(_)
            | SlotError::InvalidRequest(_) => ErrorKind::Validation,
            SlotError::Unauthenticated(_) | SlotError::Unauthorized(_) | SlotError::NotOwner(_) => {
                ErrorKind::Authorization
            }
            SlotError::SlotBooked(_) | SlotError::AlreadyBooked(_) | SlotError::NotBooked(_) => {
                ErrorKind::Conflict
            }
            SlotError::DoctorNotFound(_) | SlotError::NotFound(_) => ErrorKind::NotFound,
            SlotError::Unavailable(_) => ErrorKind::Unavailable,
            SlotError::Database(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code, one per variant.
    pub fn code(&self) -> &'static str {
        match self {
            SlotError::InvalidDate(_) => "INVALID_DATE",
            SlotError::InvalidSlots(_) => "INVALID_SLOTS",
            SlotError::NoValidSlots(_) => "NO_VALID_SLOTS",
            SlotError::InvalidRequest(_) => "INVALID_REQUEST",
            SlotError::Unauthenticated(_) => "UNAUTHENTICATED",
            SlotError::Unauthorized(_) => "UNAUTHORIZED",
            SlotError::NotOwner(_) => "NOT_OWNER",
            SlotError::DoctorNotFound(_) => "DOCTOR_NOT_FOUND",
            SlotError::NotFound(_) => "NOT_FOUND",
            SlotError::SlotBooked(_) => "SLOT_BOOKED",
            SlotError::AlreadyBooked(_) => "ALREADY_BOOKED",
            SlotError::NotBooked(_) => "NOT_BOOKED",
            SlotError::Unavailable(_) => "UNAVAILABLE",
            SlotError::Database(_) => "INTERNAL",
        }
    }

    /// Only transient storage failures are worth retrying; every other
    /// error would come back the same.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SlotError::Unavailable(_))
    }
}

pub type SlotResult<T> = Result<T, SlotError>;
