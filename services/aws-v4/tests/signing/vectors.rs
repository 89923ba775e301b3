use super::{
    example_time, init_signing_test, parse_authorization, ACCESS_KEY_ID, SECRET_ACCESS_KEY,
};
use anyhow::Result;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use pretty_assertions::assert_eq;
use sigheaders_aws_v4::RequestParams;
use std::time::SystemTime;

const LIST_USERS: &str = "Action=ListUsers&Version=2010-05-08";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Calculate the reference signature with the aws-sigv4 crate.
fn aws_sigv4_signature(
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    region: &str,
    service: &str,
    body: &[u8],
) -> Result<String> {
    let id = Credentials::new(
        ACCESS_KEY_ID,
        SECRET_ACCESS_KEY,
        None,
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region(region)
        .name(service)
        .time(SystemTime::from(example_time()))
        .settings(SigningSettings::default())
        .build()?;

    let output = sign(
        SignableRequest::new(
            method,
            uri,
            headers.iter().copied(),
            SignableBody::Bytes(body),
        )?,
        &sp.into(),
    )?;

    Ok(output.signature().to_string())
}

// https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html
#[test]
fn test_published_iam_example() -> Result<()> {
    let (_, signer) = init_signing_test("us-east-1", "iam");
    let params = RequestParams::new()
        .with_method("GET")
        .with_host("iam.amazonaws.com")
        .with_canonical_uri("/")
        .with_query_string(LIST_USERS)
        .with_header("content-type", FORM_CONTENT_TYPE);

    let headers = signer.sign(Some(&params))?;
    let (credential, signed_headers, signature) =
        parse_authorization(headers.authorization().expect("authorization must exist"));

    assert_eq!(credential, "AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request");
    assert_eq!(signed_headers, "content-type;host;x-amz-date");
    assert_eq!(
        signature,
        "5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
    );
    Ok(())
}

#[test]
fn test_iam_example_without_extra_headers_matches_aws_sigv4() -> Result<()> {
    let (_, signer) = init_signing_test("us-east-1", "iam");
    let params = RequestParams::new()
        .with_host("iam.amazonaws.com")
        .with_query_string(LIST_USERS);

    let headers = signer.sign(Some(&params))?;
    let (_, signed_headers, signature) =
        parse_authorization(headers.authorization().expect("authorization must exist"));

    let expected = aws_sigv4_signature(
        "GET",
        &format!("https://iam.amazonaws.com/?{LIST_USERS}"),
        &[],
        "us-east-1",
        "iam",
        b"",
    )?;

    assert_eq!(signed_headers, "host;x-amz-date");
    assert_eq!(signature, expected);
    Ok(())
}

#[test]
fn test_published_iam_example_matches_aws_sigv4() -> Result<()> {
    let expected = aws_sigv4_signature(
        "GET",
        &format!("https://iam.amazonaws.com/?{LIST_USERS}"),
        &[("content-type", FORM_CONTENT_TYPE)],
        "us-east-1",
        "iam",
        b"",
    )?;

    assert_eq!(
        expected,
        "5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
    );
    Ok(())
}

#[test]
fn test_post_with_payload_matches_aws_sigv4() -> Result<()> {
    let (_, signer) = init_signing_test("eu-west-1", "execute-api");
    let body = br#"{"name":"widget"}"#;
    let params = RequestParams::new()
        .with_method("post")
        .with_host("abc123.execute-api.eu-west-1.amazonaws.com")
        .with_canonical_uri("/prod/items")
        .with_header("content-type", "application/json")
        .with_header("X-Amz-Target", "ItemService.Create")
        .with_payload_hash(&sigheaders_core::hash::hex_sha256(body));

    let headers = signer.sign(Some(&params))?;
    let (_, signed_headers, signature) =
        parse_authorization(headers.authorization().expect("authorization must exist"));

    let expected = aws_sigv4_signature(
        "POST",
        "https://abc123.execute-api.eu-west-1.amazonaws.com/prod/items",
        &[
            ("content-type", "application/json"),
            ("x-amz-target", "ItemService.Create"),
        ],
        "eu-west-1",
        "execute-api",
        body,
    )?;

    assert_eq!(signed_headers, "content-type;host;x-amz-date;x-amz-target");
    assert_eq!(signature, expected);
    Ok(())
}
