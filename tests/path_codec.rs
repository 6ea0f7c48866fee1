use std::path::Path;
use couchtv::http::path_codec::{decode, encode, MARKER};

#[test]
fn marker_becomes_separator() {
    let segment = format!("{m}media{m}shows{m}ep1.mp4", m = MARKER);
    assert_eq!(decode(&segment), Path::new("/media/shows/ep1.mp4"));
}

#[test]
fn percent_escapes_are_decoded() {
    assert_eq!(
        decode("__SLASH__media__SLASH__That%20%2770s%20Show__SLASH__S01E01.mkv"),
        Path::new("/media/That '70s Show/S01E01.mkv")
    );
}

#[test]
fn encoded_separators_decode_too() {
    // encodeURIComponent(path) sends separators as %2F without the marker.
    assert_eq!(decode("%2Fmedia%2Fep%201.vtt"), Path::new("/media/ep 1.vtt"));
}

#[test]
fn invalid_utf8_is_replaced_not_rejected() {
    let path = decode("__SLASH__bad%FFname.mp4");
    assert!(path.to_string_lossy().contains('\u{FFFD}'));
}

#[test]
fn encode_leaves_no_raw_separators() {
    let encoded = encode(Path::new("/media/Poirot/S01 E01 [1080p].mkv"));
    assert!(!encoded.contains('/'));
    assert!(encoded.starts_with(MARKER));
    assert!(encoded.contains("%20"));
}

#[test]
fn decode_inverts_encode() {
    let paths = [
        "/media/shows/ep1.mp4",
        "/media/That '70s Show (1998)/Season 4/ep #3?.mkv",
        "/srv/Ünïcode/日本語/file.srt",
        "relative/dir/file.vtt",
        "/trailing/",
    ];
    for p in paths {
        let path = Path::new(p);
        assert_eq!(decode(&encode(path)), path, "round trip failed for {p}");
    }
}
