use bstr::BString;
use gix_hash::ObjectId;
use gix_ref_advertise::{Advertiser, HashSetMark, PlainSink, ResolvedObject};
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, HashMap};

fn oid(hex40: &str) -> ObjectId {
    ObjectId::from_hex(hex40.as_bytes()).expect("valid hex")
}

/// A fixed table of known objects, standing in for a real object database.
#[derive(Default, Clone)]
struct FakeResolver(HashMap<ObjectId, ResolvedObject>);

impl FakeResolver {
    fn with_commit(mut self, id: ObjectId) -> Self {
        self.0.insert(id, ResolvedObject::Other);
        self
    }

    fn with_tag(mut self, id: ObjectId, target: ObjectId) -> Self {
        self.0.insert(id, ResolvedObject::Tag { target });
        self
    }
}

impl gix_ref_advertise::ObjectResolver for FakeResolver {
    fn parse_any(&self, id: &ObjectId) -> Option<ResolvedObject> {
        self.0.get(id).copied()
    }
}

fn lines(buf: &[u8]) -> Vec<String> {
    String::from_utf8(buf.to_vec())
        .expect("ascii test fixture")
        .split_inclusive('\n')
        .map(ToOwned::to_owned)
        .collect()
}

/// S1: capability frame on the one and only line.
#[test]
fn capability_frame_on_first_line() {
    let master = oid("0123456789012345678901234567890123cdef01");
    let resolver = FakeResolver::default().with_commit(master);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));
    adv.advertise_capability("multi_ack").unwrap();
    adv.advertise_capability("side-band-64k").unwrap();

    let mut refs = BTreeMap::new();
    refs.insert(BString::from("master"), master);
    adv.send(refs).unwrap();
    adv.end().unwrap();

    let out = lines(&buf);
    assert_eq!(out.len(), 1);
    assert_eq!(
        out[0],
        format!("{master} master\0 multi_ack side-band-64k \n")
    );
}

/// First line with no registered capabilities carries no NUL at all.
#[test]
fn no_capabilities_means_no_nul() {
    let id = oid("1111111111111111111111111111111111111111");
    let resolver = FakeResolver::default().with_commit(id);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));
    let mut refs = BTreeMap::new();
    refs.insert(BString::from("refs/heads/main"), id);
    adv.send(refs).unwrap();
    adv.end().unwrap();

    assert_eq!(lines(&buf), vec![format!("{id} refs/heads/main\n")]);
}

/// S2: a tag, peeled to its commit target.
#[test]
fn tag_peel_emits_companion_line() {
    let tag = oid("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    let commit = oid("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
    let resolver = FakeResolver::default().with_tag(tag, commit).with_commit(commit);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));
    adv.set_deref_tags(true).unwrap();

    let mut refs = BTreeMap::new();
    refs.insert(BString::from("refs/tags/v1"), tag);
    adv.send(refs).unwrap();
    adv.end().unwrap();

    assert_eq!(
        lines(&buf),
        vec![
            format!("{tag} refs/tags/v1\n"),
            format!("{commit} refs/tags/v1^{{}}\n"),
        ]
    );
}

/// Nested tag chains are chased all the way to the first non-tag object.
#[test]
fn nested_tag_chain_is_fully_unwrapped() {
    let outer = oid("cccccccccccccccccccccccccccccccccccccccc");
    let inner = oid("dddddddddddddddddddddddddddddddddddddddd");
    let commit = oid("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
    let resolver = FakeResolver::default()
        .with_tag(outer, inner)
        .with_tag(inner, commit)
        .with_commit(commit);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));
    adv.set_deref_tags(true).unwrap();

    let mut refs = BTreeMap::new();
    refs.insert(BString::from("refs/tags/chain"), outer);
    adv.send(refs).unwrap();
    adv.end().unwrap();

    assert_eq!(
        lines(&buf),
        vec![
            format!("{outer} refs/tags/chain\n"),
            format!("{commit} refs/tags/chain^{{}}\n"),
        ]
    );
}

/// S3: one of two refs cannot be resolved; only the resolvable one is
/// emitted, silently, with no error.
#[test]
fn unresolvable_ref_is_silently_skipped() {
    let present = oid("1111111111111111111111111111111111111111");
    let missing = oid("2222222222222222222222222222222222222222");
    let resolver = FakeResolver::default().with_commit(present);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));

    let mut refs = BTreeMap::new();
    refs.insert(BString::from("refs/heads/gone"), missing);
    refs.insert(BString::from("refs/heads/present"), present);
    adv.send(refs).unwrap();
    adv.end().unwrap();

    assert_eq!(lines(&buf), vec![format!("{present} refs/heads/present\n")]);
}

/// Ref names are sorted ascending when the source is not already a
/// known-sorted container.
#[test]
fn unsorted_input_is_sorted_by_name() {
    let id = oid("3333333333333333333333333333333333333333");
    let resolver = FakeResolver::default().with_commit(id);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));

    let refs = vec![
        (BString::from("refs/heads/zeta"), id),
        (BString::from("refs/heads/alpha"), id),
    ];
    adv.send(refs).unwrap();
    adv.end().unwrap();

    assert_eq!(
        lines(&buf),
        vec![
            format!("{id} refs/heads/alpha\n"),
            format!("{id} refs/heads/zeta\n"),
        ]
    );
}

/// An object reachable from the ref set is only ever marked advertised
/// once, and a later `.have` for the same id is suppressed.
#[test]
fn have_is_suppressed_for_already_advertised_object() {
    let id = oid("4444444444444444444444444444444444444444");
    let resolver = FakeResolver::default().with_commit(id);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));

    let mut refs = BTreeMap::new();
    refs.insert(BString::from("refs/heads/main"), id);
    adv.send(refs).unwrap();
    adv.advertise_have(id).unwrap();
    adv.end().unwrap();

    assert_eq!(lines(&buf), vec![format!("{id} refs/heads/main\n")]);
}

/// Alternate object sources feed `.have` lines, deduplicated the same way.
#[test]
fn additional_haves_are_advertised_and_deduplicated() {
    let a = oid("5555555555555555555555555555555555555555");
    let b = oid("6666666666666666666666666666666666666666");
    let resolver = FakeResolver::default().with_commit(a).with_commit(b);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));

    adv.include_additional_haves([a, b, a]).unwrap();
    adv.end().unwrap();

    assert_eq!(
        lines(&buf),
        vec![format!("{a} .have\n"), format!("{b} .have\n")]
    );
}

#[test]
fn capability_registration_after_first_line_fails() {
    let id = oid("7777777777777777777777777777777777777777");
    let resolver = FakeResolver::default().with_commit(id);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));
    adv.advertise_id(&id, b"refs/heads/main").unwrap();

    assert!(matches!(
        adv.advertise_capability("ofs-delta"),
        Err(gix_ref_advertise::Error::AfterFirstLine)
    ));
}

#[test]
fn nul_in_ref_name_is_rejected() {
    let id = oid("8888888888888888888888888888888888888888");
    let resolver = FakeResolver::default().with_commit(id);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));

    assert!(matches!(
        adv.advertise_id(&id, b"refs/heads/ba\0d"),
        Err(gix_ref_advertise::Error::InvalidRefName)
    ));
}

#[test]
fn is_empty_reflects_first_line_flag() {
    let id = oid("9999999999999999999999999999999999999999");
    let resolver = FakeResolver::default().with_commit(id);
    let mut buf = Vec::new();
    let mut adv = Advertiser::new(resolver, HashSetMark::new(), PlainSink::new(&mut buf));
    assert!(adv.is_empty());
    adv.advertise_id(&id, b"refs/heads/main").unwrap();
    assert!(!adv.is_empty());
}
