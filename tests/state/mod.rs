mod guild_tests;
mod hook_tests;
mod resync_tests;
