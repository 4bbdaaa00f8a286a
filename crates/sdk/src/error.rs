//! Transport error descriptions
//!
//! Maps reqwest failures to the short phrase used in ClientError messages.

/// Human-readable category of a reqwest failure
pub(crate) fn describe(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "Request timed out"
    } else if err.is_connect() {
        "Failed to connect"
    } else if err.is_builder() {
        "Invalid request"
    } else if err.is_redirect() {
        "Too many redirects"
    } else if err.is_body() || err.is_decode() {
        "Failed to read response"
    } else {
        "Failed to send request"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::blocking::Client;

    #[test]
    fn test_describe_invalid_url() {
        let client = Client::builder().build().unwrap();
        let err = client.post("not a url").send().unwrap_err();

        assert_eq!(describe(&err), "Invalid request");
    }
}
