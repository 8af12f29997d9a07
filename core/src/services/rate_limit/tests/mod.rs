mod sms_guard_tests;
