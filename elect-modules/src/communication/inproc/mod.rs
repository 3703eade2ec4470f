pub mod inproc_network;
