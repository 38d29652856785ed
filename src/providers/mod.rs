pub mod boc_valet;
