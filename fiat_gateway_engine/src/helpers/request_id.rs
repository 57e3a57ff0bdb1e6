use blake2::{Blake2b512, Digest};

use crate::db_types::{Address, RequestId};

/// Derives a fresh oracle-request correlation id.
///
/// The id is the hex encoding of the first 32 bytes of `Blake2b512(gateway ‖ nonce ‖ entropy)`. Hashing the
/// gateway identity and a monotonically increasing nonce makes ids collision-resistant across deployments; the
/// 16 bytes of fresh entropy make them unguessable by anyone watching the nonce sequence.
pub fn derive_request_id(gateway: &Address, nonce: u64) -> RequestId {
    let entropy: [u8; 16] = rand::random();
    let mut hasher = Blake2b512::new();
    hasher.update(gateway.as_str().as_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.update(entropy);
    let digest = hasher.finalize();
    let id = digest[..32].iter().map(|b| format!("{b:02x}")).collect::<String>();
    RequestId(id)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_are_64_hex_chars() {
        let id = derive_request_id(&Address::from("gateway-1"), 0);
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_never_repeat() {
        let gateway = Address::from("gateway-1");
        let mut seen = std::collections::HashSet::new();
        // Same nonce reused on purpose: the entropy alone must keep ids unique.
        for _ in 0..100 {
            assert!(seen.insert(derive_request_id(&gateway, 42)));
        }
        for nonce in 0..100 {
            assert!(seen.insert(derive_request_id(&gateway, nonce)));
        }
    }
}
