pub mod aggregate;

pub use aggregate::{validate_pin, Member, MemberDto, MemberId, MemberInfo, MemberRole};
