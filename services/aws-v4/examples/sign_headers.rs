use anyhow::Result;
use log::info;
use sigheaders_aws_v4::{sign_request, RequestParams, SigningConfig};
use sigheaders_core::OsEnv;

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    // Reads AWS_REGION, AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and AWS_SIGV4_SERVICE.
    let config = SigningConfig::default().from_env(&OsEnv);
    let params = RequestParams::new()
        .with_method("get")
        .with_canonical_uri("/restapis")
        .with_query_string("limit=25");

    let headers = sign_request(&config, Some(&params))?;
    info!("signed headers: {headers:?}");

    for (name, value) in &headers {
        println!("{name}: {value}");
    }

    Ok(())
}
