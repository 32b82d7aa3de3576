use super::*;
use bytes::Bytes;

#[test]
fn test_decode_integers() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-7e").unwrap(), Value::Integer(-7));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
}

#[test]
fn test_decode_rejects_non_canonical_integers() {
    assert_eq!(decode(b"i-0e"), Err(BencodeError::InvalidInteger(0)));
    assert_eq!(decode(b"i03e"), Err(BencodeError::InvalidInteger(0)));
    assert_eq!(decode(b"ie"), Err(BencodeError::InvalidInteger(0)));
    assert_eq!(decode(b"i-e"), Err(BencodeError::InvalidInteger(0)));
    assert!(decode(b"i12").is_err());
}

#[test]
fn test_decode_binary_string() {
    let value = decode(b"3:\x00\xff\x10").unwrap();
    assert_eq!(value.as_bytes().unwrap().as_ref(), &[0x00, 0xff, 0x10]);
    assert_eq!(decode(b"0:").unwrap(), Value::Bytes(Bytes::new()));
}

#[test]
fn test_decode_string_length_past_end() {
    assert!(matches!(
        decode(b"10:short"),
        Err(BencodeError::UnexpectedEof(_))
    ));
    assert!(decode(b"99999999999999999999999:x").is_err());
}

#[test]
fn test_decode_krpc_query() {
    let data = b"d1:ad2:id20:abcdefghij0123456789e1:q4:ping1:t2:aa1:y1:qe";
    let value = decode(data).unwrap();

    assert_eq!(value.get(b"q").and_then(Value::as_bytes).unwrap().as_ref(), b"ping");
    let id = value
        .get(b"a")
        .and_then(|a| a.get(b"id"))
        .and_then(Value::as_bytes)
        .unwrap();
    assert_eq!(id.len(), 20);
}

#[test]
fn test_decode_list() {
    let value = decode(b"li201e23:A Generic Error Ocurrede").unwrap();
    let list = value.as_list().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].as_integer(), Some(201));
}

#[test]
fn test_decode_rejects_integer_key() {
    assert_eq!(decode(b"di1e1:xe"), Err(BencodeError::NonStringKey(1)));
}

#[test]
fn test_decode_trailing_data() {
    assert_eq!(decode(b"i1eXYZ"), Err(BencodeError::TrailingData(3)));
}

#[test]
fn test_decode_unterminated_containers() {
    assert!(decode(b"l").is_err());
    assert!(decode(b"d1:a").is_err());
    assert!(decode(b"").is_err());
}

#[test]
fn test_decode_nesting_limit() {
    let mut deep = vec![b'l'; 100];
    deep.extend(vec![b'e'; 100]);
    assert_eq!(decode(&deep), Err(BencodeError::NestingTooDeep));
}

#[test]
fn test_encode_sorts_keys() {
    let mut dict = Dict::new();
    dict.insert(Bytes::from_static(b"y"), Value::from("r"));
    dict.insert(Bytes::from_static(b"t"), Value::from("aa"));
    assert_eq!(encode(&Value::Dict(dict)), b"d1:t2:aa1:y1:re");
}

#[test]
fn test_encode_reproduces_canonical_input() {
    let original: &[u8] = b"d1:rd2:id20:mnopqrstuvwxyz1234565:nodes0:e1:t2:aa1:y1:re";
    assert_eq!(encode(&decode(original).unwrap()), original);
}

#[test]
fn test_encode_integer_and_list() {
    let list = Value::List(vec![Value::Integer(-3), Value::bytes(b"ab")]);
    assert_eq!(encode(&list), b"li-3e2:abe");
}
