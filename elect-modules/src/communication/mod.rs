pub mod inproc;
