use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HomePageProps {
    pub on_play: Callback<()>,
}

const LOCATIONS: [(&str, &str); 3] = [
    (
        "Stonehenge",
        "Explore the ancient stone circle shrouded in mystery and legend. Solve riddles among the monoliths and uncover the secrets of this prehistoric monument.",
    ),
    (
        "Crooked Forest",
        "Wander through a bizarre grove of twisted trees. Strange things lurk in the shadows. Can you find your way out and discover what caused the forest's unusual shapes?",
    ),
    (
        "Bermuda Triangle",
        "Brave the perilous waters haunted by disappearances. Navigate storms and supernatural phenomena as you search for lost artifacts and the truth behind the Triangle's mysteries.",
    ),
];

#[function_component(HomePage)]
pub fn home_page(props: &HomePageProps) -> Html {
    let play = {
        let cb = props.on_play.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <main class="homepage" data-testid="home-screen">
            <header class="header">
                <h1>{ "🌀 CHRONOS: THE DAWN 🌀" }</h1>
                <p>{ "Collect keys and solve puzzles across time-warped locations!" }</p>
            </header>
            <section class="description">
                <p>
                    <strong>{ "Chronos: The Dawn" }</strong>
                    { " is a text-based adventure game that lets you explore mysterious places, solve puzzles, and discover hidden treasures. Navigate through legendary locations and use your wits to survive and succeed!" }
                </p>
                <h2>{ "Locations" }</h2>
                <ul>
                    { for LOCATIONS.iter().map(|(name, blurb)| html! {
                        <li><strong>{ *name }</strong>{ ": " }{ *blurb }</li>
                    }) }
                </ul>
                <h2>{ "Keys" }</h2>
                <p>{ "You need to find keys hidden across different locations to unlock the treasure vault. Solve puzzles and explore wisely: each key brings you closer to your goal!" }</p>
                <h2>{ "Time" }</h2>
                <p>{ "Every location bends time differently, and each one gives you two minutes before its portal collapses. Watch the timer!" }</p>
            </section>
            <button type="button" class="play-button" onclick={play}>{ "▶ Play Game" }</button>
        </main>
    }
}
