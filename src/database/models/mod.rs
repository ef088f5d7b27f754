pub mod department;
pub mod grievance;
pub mod user;

pub use department::Department;
pub use grievance::{
    Attachment, Comment, CommentView, Grievance, GrievanceChanges, GrievanceView, NewAttachment, NewComment, NewGrievance,
};
pub use user::{User, UserSummary};
