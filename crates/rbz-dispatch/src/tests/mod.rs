mod dispatch_law_tests;
mod intrinsics_tests;
