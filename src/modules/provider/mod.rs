/// Remote collaborators: GitHub, the geocoder and the results backend
///
/// Ports live in `traits`, wire types in `dto`, reqwest adapters in
/// `infrastructure`.
pub mod dto;
pub mod infrastructure;
pub mod traits;

pub use dto::{
    AccountDto, ForkDto, GithubEvent, NominatimPlace, ResultPayload, StargazerDto, SubjectData,
    SubmitReceipt,
};
pub use infrastructure::{GithubClient, NominatimClient, ResultsBackendClient};
pub use traits::{GeocodeApi, GithubApi, ResultSubmitter};
