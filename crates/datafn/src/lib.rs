//! # datafn - data functions for templates
//!
//! Collection functions and datasources that a template engine exposes to the templates it renders.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `datafn` works internally.
//!
//! ### Values
//!
//! Templates hand us dynamically typed data. Everything a function receives or returns is a [value::Value]:
//! `null`, a boolean, an integer, a decimal, a string, an array or an object.
//!
//! Arrays remember what they hold. `[1, 2, 3]` read from a typed source is an array of integers, an array read from
//! JSON is an array of anything ([value::ElementKind::Any]). Functions that take elements out of an array rebuild
//! it with the same element kind ([value::Array::rebuild]), so a slice of an integer array is again an integer
//! array.
//!
//! Object keys are scalars ([value::Key]). The key `1` and the key `"1"` are different keys.
//!
//! ### Calling convention
//!
//! Template functions are variadic. Parameters come first and the collection they work on (the _subject_) comes
//! last, which lets templates pipe data into them:
//!
//! ```text
//! {{ $config | coll.omit "password" "token" }}
//! ```
//!
//! `coll.slice` is the exception and takes its subject first. [coll::Args::split] separates parameters from subject
//! and checks the argument count.
//!
//! ### Functions
//!
//! | **name**       | **arguments**                  | **result**                                   |
//! |----------------|--------------------------------|----------------------------------------------|
//! | `coll.flatten` | `[depth] array`                | nested arrays merged into one                |
//! | `coll.pick`    | `key... object`                | object with only the named keys              |
//! | `coll.omit`    | `key... object`                | object without the named keys                |
//! | `coll.slice`   | `array [start [end]]`          | elements from `start` up to `end` (exclusive)|
//!
//! The functions are registered in a [funcs::FuncMap] (see [funcs::create_coll_funcs]) which is safe to call
//! from many threads at once.
//!
//! ### Datasources
//!
//! A [datasource::Resolver] turns a url like `gcp+sm:///projects/123` into a value. The secret store resolver
//! ([datasource::secret_manager::SecretManagerResolver]) lists secrets or reads the latest version of one. Every
//! call can be cancelled through the [context::RenderContext] it runs in.
//!
pub mod coll;
pub mod context;
pub mod datasource;
pub mod funcs;
pub mod value;
