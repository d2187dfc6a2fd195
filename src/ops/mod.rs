pub mod transitions;
