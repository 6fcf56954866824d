//! function map handed to the template engine
//!
//! [create_coll_funcs] registers the collection functions ([crate::coll]) under the `coll` namespace. The
//! namespace object ([CollFuncs]) is built the first time any function is called and then shared by all of them.
//! A [FuncMap] is `Send + Sync` and can be called from any number of threads at once, including the very first
//! call that builds the namespace.
use crate::coll::{self, Args, CollError, SubjectPosition};
use crate::context::RenderContext;
use crate::value::Value;
use indexmap::IndexMap;
use std::sync::{Arc, OnceLock};

pub const NAMESPACE: &str = "coll";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FuncError {
    #[error("function {0} is not defined")]
    UnknownFunction(String),
    #[error(transparent)]
    Coll(#[from] CollError),
}

/// The `coll` namespace
#[derive(Debug, derive_new::new)]
pub struct CollFuncs {
    ctx: Arc<RenderContext>,
}

impl CollFuncs {
    pub fn context(&self) -> &Arc<RenderContext> {
        &self.ctx
    }

    pub fn flatten(&self, args: &[Value]) -> Result<Value, CollError> {
        tracing::trace!(render = self.ctx.name(), "coll.flatten");
        coll::flatten(args)
    }

    pub fn pick(&self, args: &[Value]) -> Result<Value, CollError> {
        tracing::trace!(render = self.ctx.name(), "coll.pick");
        coll::pick(args)
    }

    pub fn omit(&self, args: &[Value]) -> Result<Value, CollError> {
        tracing::trace!(render = self.ctx.name(), "coll.omit");
        coll::omit(args)
    }

    pub fn slice(&self, args: &[Value]) -> Result<Value, CollError> {
        tracing::trace!(render = self.ctx.name(), "coll.slice");
        coll::slice(args)
    }
}

type Call = fn(&CollFuncs, &[Value]) -> Result<Value, CollError>;

#[derive(Clone, Copy)]
struct Entry {
    subject: SubjectPosition,
    call: Call,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

const COLL_FUNCS: [(&str, Entry); 4] = [
    (
        "coll.flatten",
        Entry {
            subject: SubjectPosition::Last,
            call: CollFuncs::flatten,
        },
    ),
    (
        "coll.pick",
        Entry {
            subject: SubjectPosition::Last,
            call: CollFuncs::pick,
        },
    ),
    (
        "coll.omit",
        Entry {
            subject: SubjectPosition::Last,
            call: CollFuncs::omit,
        },
    ),
    (
        "coll.slice",
        Entry {
            subject: SubjectPosition::First,
            call: CollFuncs::slice,
        },
    ),
];

/// Named functions plus the lazily built namespace they share
#[derive(Debug)]
pub struct FuncMap {
    ctx: Arc<RenderContext>,
    coll: OnceLock<CollFuncs>,
    funcs: IndexMap<&'static str, Entry>,
}

pub fn create_coll_funcs(ctx: Arc<RenderContext>) -> FuncMap {
    FuncMap {
        ctx,
        coll: OnceLock::new(),
        funcs: COLL_FUNCS.into_iter().collect(),
    }
}

impl FuncMap {
    /// The `coll` namespace, built on first use
    pub fn coll(&self) -> &CollFuncs {
        self.coll.get_or_init(|| {
            tracing::debug!(render = self.ctx.name(), namespace = NAMESPACE, "init");
            CollFuncs::new(self.ctx.clone())
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.funcs.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Call with a raw argument list, as a template would
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, FuncError> {
        let entry = self.entry(name)?;
        Ok((entry.call)(self.coll(), args)?)
    }

    /// Call with parameters and subject already separated
    ///
    /// The subject is put where the function expects it.
    pub fn apply(&self, name: &str, args: Args<'_>) -> Result<Value, FuncError> {
        let entry = self.entry(name)?;

        let mut raw = Vec::with_capacity(args.params.len() + 1);
        match entry.subject {
            SubjectPosition::First => {
                raw.push(args.subject.clone());
                raw.extend_from_slice(args.params);
            }
            SubjectPosition::Last => {
                raw.extend_from_slice(args.params);
                raw.push(args.subject.clone());
            }
        }

        Ok((entry.call)(self.coll(), &raw)?)
    }

    fn entry(&self, name: &str) -> Result<Entry, FuncError> {
        self.funcs
            .get(name)
            .copied()
            .ok_or_else(|| FuncError::UnknownFunction(name.to_string()))
    }
}
