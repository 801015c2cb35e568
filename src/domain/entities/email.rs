//! Outbound email entity handed to mail transports.

/// Display name and address used in the `From` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub name: String,
    pub address: String,
}

impl Sender {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Formats the sender as `Name <address>`.
    pub fn mailbox(&self) -> String {
        if self.name.is_empty() {
            self.address.clone()
        } else {
            format!("{} <{}>", self.name, self.address)
        }
    }
}

/// A fully rendered message with both HTML and plain-text bodies.
///
/// Addresses are kept as plain strings; each transport parses them in its
/// own way and reports malformed ones as delivery failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: Sender,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_mailbox_with_name() {
        let sender = Sender::new("TireConnect Lead", "leads@example.com");
        assert_eq!(sender.mailbox(), "TireConnect Lead <leads@example.com>");
    }

    #[test]
    fn test_sender_mailbox_without_name() {
        let sender = Sender::new("", "leads@example.com");
        assert_eq!(sender.mailbox(), "leads@example.com");
    }
}
