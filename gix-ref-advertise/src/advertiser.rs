//! The ref advertisement encoder itself.

use crate::{
    error::{Error, Result},
    mark::AdvertisedMark,
    refs::RefContainer,
    resolver::{ObjectResolver, ResolvedObject},
    sink::LineSink,
};
use gix_hash::ObjectId;
use indexmap::IndexSet;

/// The pseudo ref name used for synthetic `.have` lines.
pub const HAVE_PSEUDO_REF: &[u8] = b".have";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Accumulating,
    Emitting,
}

/// Encodes a set of named object references plus capability tokens into the
/// opening advertisement of the git fetch/push wire protocol.
///
/// `R` resolves object ids, `M` is the (externally owned) advertised-mark,
/// and `S` is the line sink lines are written to. All three are bound at
/// construction, corresponding to spec.md's `init(resolver, advertisedMark)`
/// plus the sink the host chooses to advertise over.
pub struct Advertiser<R, M, S> {
    resolver: R,
    mark: M,
    sink: S,
    deref_tags: bool,
    capabilities: IndexSet<String>,
    state: State,
    first_line: bool,
    closed: bool,
}

impl<R, M, S> Advertiser<R, M, S>
where
    R: ObjectResolver,
    M: AdvertisedMark,
    S: LineSink,
{
    /// Binds the resolver, advertised-mark and line sink for one
    /// advertisement session.
    pub fn new(resolver: R, mark: M, sink: S) -> Self {
        Self {
            resolver,
            mark,
            sink,
            deref_tags: false,
            capabilities: IndexSet::new(),
            state: State::Accumulating,
            first_line: true,
            closed: false,
        }
    }

    /// Configures whether each advertised tag is followed by a peeled
    /// companion line. Must be called before the first emitted line.
    pub fn set_deref_tags(&mut self, enabled: bool) -> Result<()> {
        self.guard_accumulating()?;
        self.deref_tags = enabled;
        Ok(())
    }

    /// Registers a capability token, deduplicated and kept in registration
    /// order. Must be called before the first emitted line.
    pub fn advertise_capability(&mut self, name: impl Into<String>) -> Result<()> {
        self.guard_accumulating()?;
        self.capabilities.insert(name.into());
        Ok(())
    }

    /// Whether no line has been successfully emitted yet.
    pub fn is_empty(&self) -> bool {
        self.first_line
    }

    fn guard_accumulating(&self) -> Result<()> {
        match self.state {
            State::Accumulating => Ok(()),
            State::Emitting => Err(Error::AfterFirstLine),
        }
    }

    /// Emits advertisement lines for every resolvable ref in `refs`, in
    /// ascending name order (preserved from the container when it is already
    /// totally ordered, sorted otherwise). Unresolvable refs are silently
    /// skipped. When tag peeling is enabled and a ref resolves to a tag, a
    /// second line with name `<ref>^{}` carries the fully unwrapped non-tag
    /// target.
    pub fn send(&mut self, refs: impl RefContainer) -> Result<()> {
        for (name, id) in refs.into_sorted_entries() {
            let Some(resolved) = self.resolver.parse_any(&id) else {
                #[cfg(feature = "tracing")]
                tracing::trace!(ref_name = %name, %id, "skipping unresolvable ref");
                continue;
            };
            self.advertise_id(&id, &name)?;
            self.advertise_any_once(&id);

            if self.deref_tags {
                if let ResolvedObject::Tag { target } = resolved {
                    if let Some(peeled) = self.peel_tag(target) {
                        let mut peeled_name = name.clone();
                        peeled_name.extend_from_slice(b"^{}");
                        self.advertise_id(&peeled, &peeled_name)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Emits a synthetic `.have` line for `id`, skipped if `id` has already
    /// been advertised this session. If `id` is a tag, its immediate target
    /// is recursively advertised as `.have` as well, subject to the same
    /// dedup.
    pub fn advertise_have(&mut self, id: ObjectId) -> Result<()> {
        if !self.advertise_any_once(&id) {
            return Ok(());
        }
        self.advertise_id(&id, HAVE_PSEUDO_REF)?;
        if let Some(ResolvedObject::Tag { target }) = self.resolver.parse_any(&id) {
            self.advertise_have(target)?;
        }
        Ok(())
    }

    /// Calls [`Self::advertise_have`] for every id yielded by `alternates`.
    pub fn include_additional_haves(&mut self, alternates: impl IntoIterator<Item = ObjectId>) -> Result<()> {
        for id in alternates {
            self.advertise_have(id)?;
        }
        Ok(())
    }

    /// Writes one line for `(id, name)`, decorating it with the registered
    /// capabilities if this is the first line emitted this session.
    pub fn advertise_id(&mut self, id: &ObjectId, name: &[u8]) -> Result<()> {
        if self.closed {
            return Err(Error::SinkClosed);
        }
        if name.contains(&0) {
            return Err(Error::InvalidRefName);
        }

        let mut line = Vec::with_capacity(id.as_bytes().len() * 2 + name.len() + 2);
        line.extend_from_slice(id.to_string().as_bytes());
        line.push(b' ');
        line.extend_from_slice(name);

        let is_first = self.first_line;
        if is_first && !self.capabilities.is_empty() {
            line.push(0);
            for cap in &self.capabilities {
                line.push(b' ');
                line.extend_from_slice(cap.as_bytes());
            }
            line.push(b' ');
        }
        line.push(b'\n');

        // The first-line flag (and the accumulating -> emitting transition)
        // flips here, before the write, so that a sink I/O failure still
        // leaves the advertiser reflecting that a line was attempted.
        self.state = State::Emitting;
        self.first_line = false;

        self.sink.write_line(&line)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(ref_name = %bstr::BStr::new(name), %id, first_line = is_first, "advertised line");
        Ok(())
    }

    /// Terminates the advertisement stream.
    pub fn end(&mut self) -> Result<()> {
        self.closed = true;
        self.sink.end()?;
        Ok(())
    }

    /// Marks `id` advertised if it was not already; returns whether this was
    /// the first time. Corresponds to spec.md's `advertiseAnyOnce`.
    fn advertise_any_once(&mut self, id: &ObjectId) -> bool {
        if self.mark.is_set(id) {
            false
        } else {
            self.mark.set(id);
            true
        }
    }

    /// Chases a tag's target chain to the first non-tag object, marking each
    /// intermediate object advertised along the way. Returns `None` if any
    /// intermediate resolution fails, in which case the peeled line is
    /// omitted entirely.
    fn peel_tag(&mut self, mut current: ObjectId) -> Option<ObjectId> {
        loop {
            let resolved = self.resolver.parse_any(&current)?;
            self.advertise_any_once(&current);
            match resolved {
                ResolvedObject::Tag { target } => current = target,
                ResolvedObject::Other => return Some(current),
            }
        }
    }
}
