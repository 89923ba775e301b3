use super::{example_time, init_signing_test, parse_authorization};
use anyhow::Result;
use pretty_assertions::assert_eq;
use sigheaders_aws_v4::canonical::{
    canonical_headers, canonical_request, credential_scope, signed_headers_list, string_to_sign,
};
use sigheaders_aws_v4::{generate_signing_key, sign_request, RequestParams, RequestSigner};
use sigheaders_core::hash::{hex_hmac_sha256, EMPTY_STRING_SHA256};
use sigheaders_core::time::{format_date, format_iso8601};
use test_case::test_case;

#[test]
fn test_deterministic_at_fixed_time() -> Result<()> {
    let (_, signer) = init_signing_test("us-east-1", "execute-api");
    let params = RequestParams::new()
        .with_method("PUT")
        .with_canonical_uri("/prod/items/42")
        .with_query_string("force=true")
        .with_header("x-amz-security-token", "token");

    let first = signer.sign(Some(&params))?;
    let second = signer.clone().sign(Some(&params))?;

    assert_eq!(first, second);
    assert_eq!(
        first.iter().collect::<Vec<_>>(),
        second.iter().collect::<Vec<_>>()
    );
    Ok(())
}

#[test]
fn test_concurrent_signing_is_independent() -> Result<()> {
    let (_, signer) = init_signing_test("us-east-1", "execute-api");
    let expected = signer.sign(None)?;

    std::thread::scope(|s| {
        let handles = (0..4)
            .map(|_| s.spawn(|| signer.sign(None)))
            .collect::<Vec<_>>();
        for handle in handles {
            let headers = handle
                .join()
                .expect("thread must not panic")
                .expect("sign must succeed");
            assert_eq!(headers, expected);
        }
    });
    Ok(())
}

#[test]
fn test_omitted_params_use_defaults() -> Result<()> {
    let (config, _) = init_signing_test("us-east-1", "apigateway");
    let signer = RequestSigner::new(config.clone()).with_time(example_time());
    // No service set at all must behave like "apigateway".
    let mut unset_service = config;
    unset_service.service = None;
    let unset_signer = RequestSigner::new(unset_service).with_time(example_time());

    let omitted = unset_signer.sign(None)?;
    let explicit = signer.sign(Some(
        &RequestParams::new()
            .with_method("GET")
            .with_canonical_uri("/")
            .with_query_string("")
            .with_payload_hash(EMPTY_STRING_SHA256),
    ))?;
    let empty = signer.sign(Some(&RequestParams::default()))?;

    assert_eq!(omitted, explicit);
    assert_eq!(omitted, empty);
    assert_eq!(omitted.get("host"), Some("apigateway.us-east-1.amazonaws.com"));
    assert_eq!(omitted.get("Accept"), Some("application/json"));
    assert_eq!(omitted.len(), 4);
    Ok(())
}

#[test_case("us-east-1", "iam"; "iam")]
#[test_case("eu-central-1", "execute-api"; "execute api")]
#[test_case("ap-northeast-1", "apigateway"; "default service")]
fn test_credential_scope_consistency(region: &str, service: &str) {
    let (_, signer) = init_signing_test(region, service);
    let params = RequestParams::new().with_header("content-type", "application/json");

    let headers = signer.sign(Some(&params)).expect("sign must succeed");
    let (credential, signed_headers, signature) =
        parse_authorization(headers.authorization().expect("authorization must exist"));

    let now = example_time();
    let scope = credential_scope(&format_date(now), region, service);
    assert_eq!(credential, format!("{}/{scope}", super::ACCESS_KEY_ID));

    // Rebuild the signature from the public building blocks with the same scope.
    let host = format!("{service}.{region}.amazonaws.com");
    let creq = canonical_request(
        "GET",
        "/",
        "",
        &canonical_headers(&host, &format_iso8601(now), &params.extra_headers),
        &signed_headers_list(&params.extra_headers),
        EMPTY_STRING_SHA256,
    );
    let sts = string_to_sign(&format_iso8601(now), &scope, &creq);
    assert_eq!(sts.lines().nth(2), Some(scope.as_str()));

    let key = generate_signing_key(super::SECRET_ACCESS_KEY, &format_date(now), region, service);
    assert_eq!(signed_headers, "content-type;host;x-amz-date");
    assert_eq!(signature, hex_hmac_sha256(&key, sts.as_bytes()));
}

#[test_case("host", "override.example.com"; "host")]
#[test_case("x-amz-date", "20200101T000000Z"; "date")]
fn test_extra_headers_win_on_collision(name: &str, value: &str) {
    let (_, signer) = init_signing_test("us-east-1", "iam");
    let params = RequestParams::new().with_header(name, value);

    let headers = signer.sign(Some(&params)).expect("sign must succeed");
    let (_, signed_headers, _) =
        parse_authorization(headers.authorization().expect("authorization must exist"));

    assert_eq!(headers.get(name), Some(value));
    assert_eq!(signed_headers, "host;x-amz-date");
}

#[test]
fn test_extra_header_override_changes_signature() -> Result<()> {
    let (_, signer) = init_signing_test("us-east-1", "iam");

    let plain = signer.sign(None)?;
    let overridden = signer.sign(Some(
        &RequestParams::new().with_header("host", "override.example.com"),
    ))?;

    assert_ne!(plain.authorization(), overridden.authorization());
    Ok(())
}

#[test]
fn test_extra_header_names_kept_as_supplied() -> Result<()> {
    let (_, signer) = init_signing_test("us-east-1", "iam");
    let params = RequestParams::new()
        .with_header("Host", "override.example.com")
        .with_header("X-Amz-Security-Token", "token");

    let headers = signer.sign(Some(&params))?;
    let (_, signed_headers, _) =
        parse_authorization(headers.authorization().expect("authorization must exist"));

    // Canonical form lower-cases, the returned map keeps the caller's names.
    assert_eq!(signed_headers, "host;x-amz-date;x-amz-security-token");
    assert_eq!(headers.get("Host"), Some("override.example.com"));
    assert_eq!(headers.get("host"), Some("iam.us-east-1.amazonaws.com"));
    assert_eq!(headers.get("X-Amz-Security-Token"), Some("token"));
    assert_eq!(headers.get("x-amz-security-token"), None);
    Ok(())
}

#[test]
fn test_sign_request_uses_one_instant() -> Result<()> {
    let (config, _) = init_signing_test("us-east-1", "iam");

    let headers = sign_request(&config, None)?;
    let date = headers.get("x-amz-date").expect("date must exist");
    let (credential, _, _) =
        parse_authorization(headers.authorization().expect("authorization must exist"));

    assert_eq!(date.len(), "20150830T123600Z".len());
    assert!(date.ends_with('Z'));
    // Scope date is the date part of the x-amz-date header.
    let scope_date = credential.split('/').nth(1).expect("scope must have date");
    assert_eq!(scope_date, &date[..8]);
    Ok(())
}
