#![no_main]

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;

static PROVIDER: Lazy<strongbox_crypto::EncryptionProvider> = Lazy::new(|| {
    strongbox_crypto::EncryptionProvider::new(strongbox_crypto::MasterKey::new(&[0x11u8; 32]).unwrap())
});

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let split = (data[0] as usize) % (data.len() + 1);
    let (envelope, context_bytes) = data.split_at(split);
    let context = String::from_utf8_lossy(context_bytes);

    let _ = PROVIDER.decrypt(envelope, &context);
});
