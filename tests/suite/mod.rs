mod bootstrap;
mod fail_fast;
mod ordering;
