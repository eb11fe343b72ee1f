pub mod bundle_testkit;
