use std::error::Error;
use std::fmt::{self, Display};

use serde::{Serialize, Serializer};

use super::ErrorRecord;
use crate::types::Cause;

impl Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return Display::fmt(&self.formatter(), f);
        }
        Display::fmt(&self.formatter().verbose(), f)
    }
}

impl Error for ErrorRecord {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(|cause| match cause {
            Cause::Structured(record) => record.as_ref() as &(dyn Error + 'static),
            Cause::Opaque(error) => error.as_ref() as &(dyn Error + 'static),
        })
    }
}

impl Serialize for ErrorRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_structured_map().serialize(serializer)
    }
}
