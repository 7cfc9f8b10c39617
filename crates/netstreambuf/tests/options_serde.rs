#![allow(missing_docs)]

use netstreambuf::{Growth, NetworkStringBuf, StreamBufOptions};

#[test]
fn options_roundtrip_through_json() {
    let options = StreamBufOptions {
        desired_size: 4096,
        growth: Growth::Increment(1024),
        max_size: 1 << 20,
    };
    let json = serde_json::to_string(&options).unwrap();
    assert_eq!(
        json,
        r#"{"desired_size":4096,"growth":{"increment":1024},"max_size":1048576}"#
    );
    let back: StreamBufOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
}

#[test]
fn missing_fields_take_defaults() {
    let options: StreamBufOptions = serde_json::from_str(r#"{"growth":{"factor":2.0}}"#).unwrap();
    assert_eq!(options.desired_size, 1024);
    assert_eq!(options.max_size, 10 * 1024 * 1024);

    let buf = NetworkStringBuf::from_options(&options);
    assert_eq!(buf.growth(), Growth::Factor(2.0));
}
