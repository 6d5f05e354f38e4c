error_chain! {
    errors {
        Validation(message: String) {
            description("invalid invocation")
            display("{}", message)
        }
        Transfer(message: String) {
            description("file transfer failed")
            display("{}", message)
        }
        Logging(message: String) {
            description("unable to configure logging")
            display("Unable to configure logging: {}", message)
        }
    }
}

/// The innermost cause of an error, which is what gets shown on a per-file error line.
pub fn root_cause_description(error: &Error) -> String {
    match error.iter().last() {
        Some(cause) => cause.to_string(),
        None => error.to_string(),
    }
}
