//! In-flight request tickets, one generation counter per operation class

use serde::Serialize;

const OPERATION_COUNT: usize = 11;

/// Operation classes the shell can have in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchCatalog,
    Register,
    LogIn,
    FetchUser,
    CreateBook,
    EditBook,
    DeleteBook,
    Borrow,
    FetchBorrowed,
    ReturnBook,
    FetchHistory,
}

impl Operation {
    pub const ALL: [Operation; OPERATION_COUNT] = [
        Operation::FetchCatalog,
        Operation::Register,
        Operation::LogIn,
        Operation::FetchUser,
        Operation::CreateBook,
        Operation::EditBook,
        Operation::DeleteBook,
        Operation::Borrow,
        Operation::FetchBorrowed,
        Operation::ReturnBook,
        Operation::FetchHistory,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchCatalog => "fetch_catalog",
            Operation::Register => "register",
            Operation::LogIn => "log_in",
            Operation::FetchUser => "fetch_user",
            Operation::CreateBook => "create_book",
            Operation::EditBook => "edit_book",
            Operation::DeleteBook => "delete_book",
            Operation::Borrow => "borrow",
            Operation::FetchBorrowed => "fetch_borrowed",
            Operation::ReturnBook => "return_book",
            Operation::FetchHistory => "fetch_history",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Proof that a response belongs to a specific request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub operation: Operation,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counter {
    issued: u64,
    settled: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTickets {
    counters: [Counter; OPERATION_COUNT],
}

impl RequestTickets {
    pub fn issue(&mut self, operation: Operation) -> Ticket {
        let counter = &mut self.counters[operation.index()];
        counter.issued += 1;
        Ticket {
            operation,
            generation: counter.issued,
        }
    }

    /// A ticket is current while no newer request of its class was issued
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.counters[ticket.operation.index()].issued == ticket.generation
    }

    pub fn settle(&mut self, ticket: &Ticket) {
        let counter = &mut self.counters[ticket.operation.index()];
        counter.settled = counter.settled.max(ticket.generation);
    }

    pub fn is_pending(&self, operation: Operation) -> bool {
        let counter = self.counters[operation.index()];
        counter.issued > counter.settled
    }
}
