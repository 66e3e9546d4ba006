pub mod committee_dto;

pub use committee_dto::{
    CommitteeDto, CommitteeTagResponseDto, CreateCommitteeTagDto, DeleteTagQuery,
};
