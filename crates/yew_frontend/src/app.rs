//! Main application component

use crate::components::diagnosis::DiagnosisWizard;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <div class="app">
            <header class="app-header">
                <h1>{ "cropdoc" }</h1>
                <p>{ "Plant disease diagnosis from a leaf photo" }</p>
            </header>
            <main class="app-main">
                <DiagnosisWizard />
            </main>
            <footer class="app-footer">
                <p>{ "Results are advisory; confirm with a local agronomist." }</p>
            </footer>
        </div>
    }
}
