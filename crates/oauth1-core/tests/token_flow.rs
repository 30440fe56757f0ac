//! Full three-legged exchange against canned provider responses.

use oauth1_core::{
    Authentication, FixedClock, HmacSha1Signer, OAuthError, SignatureBaseStringBuilder, Signer,
    percent_encode,
};
use pretty_assertions::assert_eq;
use ureq::http::header::AUTHORIZATION;
use ureq::http::{Request, Uri};

const REQUEST_TOKEN_URL: &str = "https://www.google.com/accounts/OAuthGetRequestToken";
const AUTHORIZE_TOKEN_URL: &str = "https://www.google.com/accounts/OAuthAuthorizeToken";
const ACCESS_TOKEN_URL: &str = "https://www.google.com/accounts/OAuthGetAccessToken";
const FEED_URL: &str = "https://www.google.com/calendar/feeds/default/private/full?max-results=5";

fn get(url: &str) -> Request<Vec<u8>> {
    Request::get(url).body(Vec::new()).unwrap()
}

fn authorization(request: &Request<Vec<u8>>) -> String {
    request
        .headers()
        .get(AUTHORIZATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned()
}

fn resource_clock() -> FixedClock {
    FixedClock::new("1262325800", "resource-nonce")
}

#[test]
fn test_installed_app_flow() {
    // Request token
    let mut auth = Authentication::for_installed_app()
        .with_clock(FixedClock::new("1262325600", "4572616e48616d6d65724c61686176"));
    auth.params_mut()
        .set_callback("http://www.example.com/OAuthCallback");
    auth.params_mut()
        .set_scope("https://www.google.com/calendar/feeds/");

    let mut request = get(REQUEST_TOKEN_URL);
    auth.add_request_token_header(&mut request).unwrap();
    assert!(authorization(&request).ends_with("oauth_signature=\"Z32HWR0BWzg%2FRUCuB1DLV3FUdb8%3D\""));

    auth.set_keys_for_response_str(
        "oauth_token=4%2Frequest-token&oauth_token_secret=request-secret&oauth_callback_confirmed=true",
    );
    assert_eq!(auth.params().callback_confirmed(), Some("true"));
    assert!(!auth.has_access_token());

    // Authorize token
    let authorize: Uri = AUTHORIZE_TOKEN_URL.parse().unwrap();
    assert_eq!(
        auth.authorize_token_uri(&authorize).unwrap().to_string(),
        "https://www.google.com/accounts/OAuthAuthorizeToken?oauth_token=4%2Frequest-token"
    );

    // Resource access is refused until the exchange completes
    let mut early = get(FEED_URL);
    assert!(matches!(
        auth.authorize_request(&mut early),
        Err(OAuthError::NotAuthorized)
    ));

    // Access token
    let mut auth = auth.with_clock(FixedClock::new("1262325700", "abc123"));
    auth.params_mut().set_verifier("v3r1f13r");

    let mut request = get(ACCESS_TOKEN_URL);
    auth.add_access_token_header(&mut request).unwrap();
    assert!(authorization(&request).ends_with("oauth_signature=\"3zMZgl1%2FJOUzF%2FTa0PlIVDLkqpU%3D\""));

    auth.set_keys_for_response_str("oauth_token=1%2Faccess&oauth_token_secret=access-secret");
    auth.set_has_access_token(true);

    // Resource access
    let auth = auth.with_clock(resource_clock());
    let mut request = get(FEED_URL);
    auth.authorize_request(&mut request).unwrap();
    let header = authorization(&request);

    let base_string = SignatureBaseStringBuilder::new("GET", &FEED_URL.parse().unwrap())
        .unwrap()
        .param("oauth_consumer_key", "anonymous")
        .param("oauth_nonce", "resource-nonce")
        .param("oauth_signature_method", "HMAC-SHA1")
        .param("oauth_timestamp", "1262325800")
        .param("oauth_token", "1/access")
        .param("oauth_version", "1.0")
        .build();
    let expected = HmacSha1Signer::new("anonymous", Some("access-secret"))
        .sign(&base_string)
        .unwrap();

    assert_eq!(
        header,
        format!(
            "OAuth oauth_consumer_key=\"anonymous\", oauth_nonce=\"resource-nonce\", \
             oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1262325800\", \
             oauth_token=\"1%2Faccess\", oauth_version=\"1.0\", oauth_signature=\"{}\"",
            percent_encode(&expected)
        )
    );
    assert_eq!(request.uri().to_string(), FEED_URL);

    // Persist and restore into a fresh instance
    let persisted = auth.persistence_response_string().unwrap();
    assert_eq!(
        persisted,
        "oauth_token=1%2Faccess&oauth_token_secret=access-secret"
    );

    let mut restored = Authentication::for_installed_app().with_clock(resource_clock());
    restored.restore_from_persistence(&persisted);
    assert_eq!(restored.access_token(), Some("1/access"));

    let mut request = get(FEED_URL);
    restored.authorize_request(&mut request).unwrap();
    assert_eq!(authorization(&request), header);
}

#[test]
fn test_query_placement_flow() {
    let mut auth = Authentication::for_installed_app()
        .with_clock(FixedClock::new("1262325600", "4572616e48616d6d65724c61686176"));
    auth.params_mut()
        .set_callback("http://www.example.com/OAuthCallback");
    auth.params_mut()
        .set_scope("https://www.google.com/calendar/feeds/");

    let mut request = get(REQUEST_TOKEN_URL);
    auth.add_request_token_params(&mut request).unwrap();

    assert!(request.headers().get(AUTHORIZATION).is_none());
    assert_eq!(
        request.uri().to_string(),
        "https://www.google.com/accounts/OAuthGetRequestToken\
         ?oauth_callback=http%3A%2F%2Fwww.example.com%2FOAuthCallback\
         &oauth_consumer_key=anonymous&oauth_nonce=4572616e48616d6d65724c61686176\
         &oauth_signature_method=HMAC-SHA1&oauth_timestamp=1262325600&oauth_version=1.0\
         &oauth_signature=Z32HWR0BWzg%2FRUCuB1DLV3FUdb8%3D\
         &scope=https%3A%2F%2Fwww.google.com%2Fcalendar%2Ffeeds%2F"
    );
}
