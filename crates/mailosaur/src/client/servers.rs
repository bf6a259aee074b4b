//! Server-scoped helpers

use rand::Rng;

use super::MailosaurClient;
use crate::models::ServerId;

/// Length of the random local-part prefix of generated addresses
const TOKEN_LEN: usize = 10;

/// Operations scoped to a server
pub struct Servers<'a> {
    client: &'a MailosaurClient,
}

impl<'a> Servers<'a> {
    pub(super) fn new(client: &'a MailosaurClient) -> Self {
        Self { client }
    }

    /// Generate a disposable address that delivers to `server`.
    ///
    /// Purely local; nothing is registered with the service.
    pub fn generate_email_address(&self, server: &ServerId) -> String {
        format!(
            "{}.{}@{}",
            random_token(TOKEN_LEN),
            server.as_str(),
            self.client.smtp_host
        )
    }
}

/// Random lowercase base36 string
fn random_token(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::models::is_valid_address;

    fn client() -> MailosaurClient {
        MailosaurClient::new(ClientConfig::new("key").with_smtp_host("sandbox.mailosaur.io")).unwrap()
    }

    #[test]
    fn test_address_is_scoped_to_server() {
        let client = client();
        let address = client
            .servers()
            .generate_email_address(&ServerId::new("abc123"));

        let (local, domain) = address.split_once('@').unwrap();
        assert_eq!(domain, "sandbox.mailosaur.io");
        assert!(local.ends_with(".abc123"));
        assert_eq!(local.len(), TOKEN_LEN + ".abc123".len());
        assert!(is_valid_address(&address));
    }

    #[test]
    fn test_addresses_differ() {
        let client = client();
        let server = ServerId::new("abc123");
        let first = client.servers().generate_email_address(&server);
        let second = client.servers().generate_email_address(&server);
        assert_ne!(first, second);
    }

    #[test]
    fn test_many_addresses_are_unique() {
        let client = client();
        let server = ServerId::new("abc123");
        let addresses: std::collections::HashSet<_> = (0..1000)
            .map(|_| client.servers().generate_email_address(&server))
            .collect();
        assert_eq!(addresses.len(), 1000);
    }

    #[test]
    fn test_random_token_alphabet() {
        let token = random_token(TOKEN_LEN);
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
