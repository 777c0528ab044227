use strongbox_crypto::{CryptoError, EncryptionProvider, MasterKey, OVERHEAD_BYTES};

fn provider(key_byte: u8) -> EncryptionProvider {
    EncryptionProvider::new(MasterKey::new(&[key_byte; 32]).unwrap())
}

#[test]
fn roundtrip_basic() {
    let p = provider(1);
    let ct = p.encrypt(b"hello strongbox world", "ctx").unwrap();
    let pt = p.decrypt(&ct, "ctx").unwrap();
    assert_eq!(pt, b"hello strongbox world");
}

#[test]
fn roundtrip_empty_plaintext() {
    let p = provider(2);
    let ct = p.encrypt(b"", "ctx").unwrap();
    assert_eq!(ct.len(), OVERHEAD_BYTES);
    let pt = p.decrypt(&ct, "ctx").unwrap();
    assert!(pt.is_empty());
}

#[test]
fn roundtrip_large_plaintext() {
    let p = provider(3);
    let plaintext = vec![0xABu8; 65536];
    let ct = p.encrypt(&plaintext, "ctx").unwrap();
    let pt = p.decrypt(&ct, "ctx").unwrap();
    assert_eq!(pt, plaintext);
}

#[test]
fn wrong_context_fails() {
    let p = provider(4);
    let ct = p.encrypt(b"data", "good-ctx").unwrap();
    assert_eq!(p.decrypt(&ct, "bad-ctx"), Err(CryptoError::Authentication));
}

#[test]
fn wrong_key_fails() {
    let p1 = provider(5);
    let p2 = provider(6);
    let ct = p1.encrypt(b"data", "ctx").unwrap();
    assert_eq!(p2.decrypt(&ct, "ctx"), Err(CryptoError::Authentication));
}

#[test]
fn bit_flip_anywhere_fails() {
    let p = provider(7);
    let ct = p.encrypt(b"some plaintext long enough to flip", "ctx").unwrap();
    for i in 0..ct.len() {
        let mut tampered = ct.clone();
        tampered[i] ^= 0x01;
        assert_eq!(p.decrypt(&tampered, "ctx"), Err(CryptoError::Authentication));
    }
}

#[test]
fn envelope_length_is_plaintext_plus_overhead() {
    let p = provider(8);
    for len in [0, 1, 16, 1000] {
        let pt = vec![0x11u8; len];
        let ct = p.encrypt(&pt, "ctx").unwrap();
        assert_eq!(ct.len(), len + OVERHEAD_BYTES);
    }
}

#[test]
fn invalid_master_key_length_rejected() {
    assert!(MasterKey::new(&[0u8; 31]).is_err());
    assert!(MasterKey::new(&[0u8; 33]).is_err());
    assert!(MasterKey::new(&[0u8; 32]).is_ok());
}
