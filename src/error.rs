//! Error type for native graphics calls

/// A native graphics call reported failure.
///
/// This is the only error the asset layer produces. The call name and the
/// native library's error string are kept for the message; there is no
/// further classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("SDL call failed: {call}: {message}")]
    NativeCall { call: &'static str, message: String },
}

impl AssetError {
    pub fn native_call(call: &'static str, message: impl Into<String>) -> Self {
        Self::NativeCall {
            call,
            message: message.into(),
        }
    }

    /// Name of the native function that failed
    pub fn call(&self) -> &'static str {
        match self {
            Self::NativeCall { call, .. } => call,
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AssetError::native_call("SDL_SetColorKey", "Invalid surface");
        assert_eq!(
            err.to_string(),
            "SDL call failed: SDL_SetColorKey: Invalid surface"
        );
        assert_eq!(err.call(), "SDL_SetColorKey");
    }
}
