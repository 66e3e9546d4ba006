pub mod ticket_dto;

pub use ticket_dto::{
    CreateTicketDto, ForwardResponseDto, ForwardTicketDto, ForwardedToDto, TicketResponseDto,
    UpdateTicketStatusDto,
};
