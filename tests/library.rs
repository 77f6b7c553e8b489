use decodr::{
    BruteForcer, CandidateRanker, Capability, DecodrError, FormatLabel, Params, RankerConfig,
    SchemeRegistry,
};
use decodr::schemes::AFFINE_MULTIPLIERS;
use proptest::prelude::*;

#[test]
fn dispatcher_errors_are_typed() {
    assert!(matches!(
        decodr::decode("nonexistent-scheme", "x", &Params::new()),
        Err(DecodrError::UnknownScheme(_))
    ));
    assert!(matches!(
        decodr::crack("vigenere", "x"),
        Err(DecodrError::UnsupportedCapability {
            capability: Capability::Crack,
            ..
        })
    ));
}

#[test]
fn crack_recovers_caesar_shift() {
    let results = decodr::crack("caesar", "Khoor").unwrap();
    assert_eq!(results.len(), 26);
    assert_eq!(results[3].plaintext, "Hello");
    assert_eq!(results[3].key.value("shift"), Some(3));
}

#[test]
fn affine_key_space_is_312() {
    let attempts = BruteForcer::new(SchemeRegistry::global())
        .attempts("affine", "IHHWVC SWFRCP")
        .unwrap();
    assert_eq!(attempts.len(), 312);
}

#[test]
fn url_decode_is_strict() {
    for bad in ["%+1", "%-1", "%g0", "%"] {
        assert!(matches!(
            decodr::decode("url", bad, &Params::new()),
            Err(DecodrError::InvalidInput { .. })
        ));
    }
    assert_eq!(decodr::decode("base64", "ab==", &Params::new()).unwrap(), "i");
}

#[test]
fn classify_examples() {
    assert_eq!(decodr::classify("48656c6c6f").label, FormatLabel::Hex);
    assert_eq!(decodr::classify("SGVsbG8=").label, FormatLabel::Base64);
    assert_eq!(decodr::classify("%48%65%6C%6C%6F").label, FormatLabel::UrlEncoded);
    assert_eq!(decodr::classify("").label, FormatLabel::Empty);
    assert_eq!(decodr::classify("ab==").label, FormatLabel::Base64);
    assert_eq!(decodr::classify("HELLO").confidence, 1.0);
}

#[test]
fn detect_hex_hello() {
    let top = decodr::detect("48656c6c6f", 1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].scheme, "hex");
    assert_eq!(top[0].result, "Hello");
    assert_eq!(top[0].score, 1.0);
}

#[test]
fn custom_config_through_ranker() {
    let config = RankerConfig {
        parallel: true,
        ..RankerConfig::default()
    };
    let ranker = CandidateRanker::with_config(SchemeRegistry::global(), config).unwrap();
    let parallel = ranker.detect("Uryyb", 50);
    let sequential = decodr::detect("Uryyb", 50);
    assert_eq!(parallel, sequential);
}

fn round_trips(scheme: &str, text: &str) -> bool {
    let params = Params::new();
    let encoded = decodr::encode(scheme, text, &params).unwrap();
    decodr::decode(scheme, &encoded, &params).unwrap() == text
}

proptest! {
    #[test]
    fn keyless_decode_inverts_encode(text in "[ -~]{0,64}") {
        for scheme in ["base64", "base32", "hex", "url", "rot13", "rot47", "atbash"] {
            prop_assert!(round_trips(scheme, &text), "{} failed on {:?}", scheme, text);
        }
    }

    #[test]
    fn keyed_decrypt_inverts_encrypt(
        text in "[ -~]{0,64}",
        shift in -100i64..100,
        byte in 0u8..=255,
        key in "[A-Za-z]{1,12}",
        rails in 2i64..8,
    ) {
        let cases = [
            ("caesar", Params::new().with("shift", shift)),
            ("affine", Params::new().with("a", 7).with("b", shift)),
            ("vigenere", Params::new().with("key", &key)),
            ("beaufort", Params::new().with("key", &key)),
            ("railfence", Params::new().with("rails", rails)),
            ("xor", Params::new().with("key", byte)),
            ("repeating_xor", Params::new().with("key", &key)),
            ("rc4", Params::new().with("key", &key)),
        ];
        for (scheme, params) in cases {
            let ct = decodr::encrypt(scheme, &text, &params).unwrap();
            let pt = decodr::decrypt(scheme, &ct, &params).unwrap();
            prop_assert_eq!(&pt, &text, "{} with {:?}", scheme, params);
        }
    }
}

proptest! {
    #[test]
    fn caesar_crack_recovers_every_shift(text in "[ -~]{0,64}", shift in 0i64..26) {
        let ct = decodr::encrypt("caesar", &text, &Params::new().with("shift", shift)).unwrap();
        let results = decodr::crack("caesar", &ct).unwrap();
        prop_assert_eq!(results.len(), 26);
        for (i, result) in results.iter().enumerate() {
            prop_assert_eq!(result.key.value("shift"), Some(i as i64));
        }
        prop_assert_eq!(&results[shift as usize].plaintext, &text);
    }

    #[test]
    fn affine_crack_recovers_key(
        text in "[ -~]{0,64}",
        index in 0usize..12,
        b in 0i64..26,
    ) {
        let a = AFFINE_MULTIPLIERS[index];
        let params = Params::new().with("a", a).with("b", b);
        let ct = decodr::encrypt("affine", &text, &params).unwrap();
        let results = decodr::crack("affine", &ct).unwrap();
        prop_assert_eq!(results.len(), 312);
        for pair in results.windows(2) {
            prop_assert!(pair[0].key < pair[1].key);
        }
        let hit = results
            .iter()
            .find(|r| r.key.value("a") == Some(a) && r.key.value("b") == Some(b))
            .unwrap();
        prop_assert_eq!(&hit.plaintext, &text);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn detect_output_is_bounded_and_sorted(text in "[ -~]{0,24}", limit in 1usize..40) {
        let candidates = decodr::detect(&text, limit);
        prop_assert!(candidates.len() <= limit);
        for pair in candidates.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for c in &candidates {
            prop_assert!((0.0..=1.0).contains(&c.score));
        }
    }
}
