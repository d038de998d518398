mod filter_test;
