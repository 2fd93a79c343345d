mod scope_tests;
